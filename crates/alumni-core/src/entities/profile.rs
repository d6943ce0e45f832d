//! Profile entity - public details shown for an alumnus

use chrono::{DateTime, Utc};

/// One profile per name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub department: String,
    pub degree: String,
    pub about: String,
    pub profile_pic: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Empty profile for a name that has none yet
    pub fn new(name: String) -> Self {
        Self {
            name,
            department: String::new(),
            degree: String::new(),
            about: String::new(),
            profile_pic: None,
            updated_at: Utc::now(),
        }
    }

    /// Overwrite the text fields. The picture only changes when a new one is given.
    pub fn apply(
        &mut self,
        department: String,
        degree: String,
        about: String,
        profile_pic: Option<String>,
    ) {
        self.department = department;
        self.degree = degree;
        self.about = about;
        if profile_pic.is_some() {
            self.profile_pic = profile_pic;
        }
        self.updated_at = Utc::now();
    }
}
