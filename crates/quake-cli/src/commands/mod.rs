pub mod completions;
pub mod featurize;
pub mod presets;
pub mod telemetry;
pub mod util;
