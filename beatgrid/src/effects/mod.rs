//! Reusable visual effect catalogue.
//!
//! Every effect here is an ordinary [`Effect`](crate::scene::Effect)
//! implementer; scenes compose them freely and custom effects plug in
//! through the same trait. Tunable state lives in the owning generator's
//! data store so timeline events can re-target an effect mid-show (new
//! lyrics, higher intensity) without touching the effect itself.

mod chaos;
mod fill;
mod motion;
mod text;

pub use chaos::Noise;
pub use fill::{ClearLayer, SolidFill};
pub use motion::{MatrixRain, ProgressBar, Wave};
pub use text::{Blink, Pulse, Scramble, Typewriter};
