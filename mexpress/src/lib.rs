//! Expression catalog, emotion taxonomy, and Live2D rig scaling.
//!
//! ```rust
//! use mexpress::{Emotion, chino11};
//!
//! let rig = chino11();
//! let pose = rig.pose(Emotion::Happy, 0.0);
//!
//! // At zero intensity every parameter holds its neutral value.
//! let eyes = pose.iter().find(|(id, _)| id == "PARAM_EYE_L_OPEN");
//! assert_eq!(eyes.map(|(_, value)| *value), Some(1.0));
//! ```

mod catalog;
mod emotion;
mod rig;

pub mod prelude {
    pub use crate::{
        AvatarRig, DEFAULT_INTENSITY, Emotion, EmotionResult, Expression, ParamRange, chino11,
        expression_catalog,
    };
}

pub use catalog::{Expression, expression_catalog};
pub use emotion::{DEFAULT_INTENSITY, Emotion, EmotionResult};
pub use rig::{AvatarRig, ParamRange, chino11};
