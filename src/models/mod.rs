pub mod enums;
pub mod health_metric;
pub mod metric_type;
pub mod settings;

pub use enums::*;
pub use health_metric::*;
pub use metric_type::*;
pub use settings::*;
