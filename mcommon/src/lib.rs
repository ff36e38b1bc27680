//! Shared primitives for the marionette workspace crates.
//!
//! ```rust
//! use mcommon::{GenerationOptions, clamp_unit};
//!
//! let options = GenerationOptions::default()
//!     .with_temperature(0.0)
//!     .with_max_tokens(150);
//!
//! assert_eq!(options.temperature, Some(0.0));
//! assert_eq!(clamp_unit(1.4), 1.0);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use mcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod model {
    //! Shared generation settings used by request types.
    //!
    //! ```rust
    //! use mcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(128));
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }
    }
}

pub mod range {
    //! Numeric range helpers shared by the normalizer and the rig scaler.
    //!
    //! ```rust
    //! use mcommon::{clamp_range, clamp_unit};
    //!
    //! assert_eq!(clamp_unit(-0.2), 0.0);
    //! assert_eq!(clamp_unit(0.7), 0.7);
    //! assert_eq!(clamp_range(45.0, -30.0, 30.0), 30.0);
    //! ```

    /// Clamps a value into `[0.0, 1.0]`.
    ///
    /// NaN maps to the lower bound so a bad upstream number can never
    /// escape the unit interval.
    pub fn clamp_unit(value: f32) -> f32 {
        clamp_range(value, 0.0, 1.0)
    }

    /// Clamps a value into `[min, max]`. NaN maps to `min`.
    pub fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
        if value.is_nan() {
            return min;
        }
        value.clamp(min, max)
    }
}

pub use future::BoxFuture;
pub use model::GenerationOptions;
pub use range::{clamp_range, clamp_unit};
