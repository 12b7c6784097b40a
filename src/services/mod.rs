pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod photo_service;
pub mod photo_service_impl;
pub use photo_service::{PhotoError, PhotoService};
pub use photo_service_impl::CloudinaryPhotoService;

pub mod token;
pub use token::{Claims, TokenIssuer};
