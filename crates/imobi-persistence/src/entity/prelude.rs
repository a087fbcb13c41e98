pub use super::banner::Entity as Banner;
pub use super::broker::Entity as Broker;
pub use super::chamada::Entity as Chamada;
pub use super::content_page::Entity as ContentPage;
pub use super::form_submission::Entity as FormSubmission;
pub use super::site_config::Entity as SiteConfig;
pub use super::slide::Entity as Slide;
pub use super::user::Entity as User;
