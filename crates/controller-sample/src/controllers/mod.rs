//! # Sample Controllers
//!
//! Three controllers built on [`controller_framework::Controller`]:
//!
//! - [`ApplicationController`] - the base type. Declares `index` and the
//!   `authenticate` helper, which the app hides from dispatch.
//! - [`PostsController`] - extends Application; hides its `load_post` helper.
//! - [`UploadsController`] - extends Application. Its `create` action is the
//!   endpoint that accepts a session id in the query string, because upload
//!   widgets cannot send cookies.

pub mod application;
pub mod posts;
pub mod uploads;

pub use application::ApplicationController;
pub use posts::PostsController;
pub use uploads::UploadsController;
