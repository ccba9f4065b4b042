//! Dependency injection infrastructure.
//!
//! Services are resolved from the application [`Context`](crate::context::Context)
//! through the `FromRef` trait and the derives from `di-macros`:
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: make each context field extractable via `FromRef`
//! - `#[derive(FromContext)]`: build a service by resolving each of its fields
//!
//! # Example
//!
//! ```ignore
//! #[derive(FromContext, Clone)]
//! pub struct AccountService {
//!     accounts: AccountRepository, // AccountRepository::from_ref(ctx)
//!     tracker: Tracker,            // Tracker::from_ref(ctx)
//! }
//!
//! let service = AccountService::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
///
/// Types that implement `FromRef<T>` can be extracted from `&T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use di_macros::{Context, FromContext};
