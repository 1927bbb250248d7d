//! SeaORM entity models
//!
//! Database entities for the ScholarFlow editorial workflow

mod article;
mod issue;
mod manuscript;
mod notification;
mod review;
mod user;
mod volume;

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
};

pub use manuscript::{
    Entity as ManuscriptEntity,
    Model as Manuscript,
    ActiveModel as ManuscriptActiveModel,
    Column as ManuscriptColumn,
    ManuscriptStatus,
};

pub use review::{
    Entity as ReviewEntity,
    Model as Review,
    ActiveModel as ReviewActiveModel,
    Column as ReviewColumn,
    Recommendation,
};

pub use volume::{
    Entity as VolumeEntity,
    Model as Volume,
    ActiveModel as VolumeActiveModel,
    Column as VolumeColumn,
};

pub use issue::{
    Entity as IssueEntity,
    Model as Issue,
    ActiveModel as IssueActiveModel,
    Column as IssueColumn,
};

pub use article::{
    validate_page_range,
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
};

pub use notification::{
    Entity as NotificationEntity,
    Model as Notification,
    ActiveModel as NotificationActiveModel,
    Column as NotificationColumn,
};
