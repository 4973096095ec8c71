// lottie-data: serde model of a parsed Lottie composition
pub mod animatable;
pub mod model;
pub mod shapes;

pub use animatable::*;
pub use model::*;
pub use shapes::*;
