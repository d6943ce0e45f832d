//! Account / profile / chat model -> entity mappers

use alumni_core::entities::{Account, ChatMessage, Profile};
use alumni_core::value_objects::Snowflake;

use crate::models::{AccountModel, ChatMessageModel, ProfileModel};

impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Account {
            id: Snowflake::new(model.id),
            name: model.name,
            email: model.email,
            occupation: model.occupation,
            interests: model.interests,
            experience: model.experience,
            created_at: model.created_at,
        }
    }
}

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            name: model.name,
            department: model.department,
            degree: model.degree,
            about: model.about,
            profile_pic: model.profile_pic,
            updated_at: model.updated_at,
        }
    }
}

impl From<ChatMessageModel> for ChatMessage {
    fn from(model: ChatMessageModel) -> Self {
        ChatMessage {
            id: Snowflake::new(model.id),
            sender: model.sender,
            receiver: model.receiver,
            message: model.message,
            created_at: model.created_at,
        }
    }
}
