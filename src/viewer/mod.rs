pub mod bindings;
pub mod gesture;
pub mod normalize;
pub mod params;

pub use bindings::TransformBindings;
pub use gesture::PanelGesture;

/// Resting pose applied by the normalizer and restored by reset.
/// Seed values at load time come from the live post-normalization pose
/// instead; the two sets are intentionally distinct.
pub const DEFAULT_POSITION: [f32; 3] = [0.0, 0.0, 0.0];
pub const DEFAULT_ROTATION: [f32; 3] = [0.0, 1.6, 0.0];
pub const DEFAULT_SCALE: f32 = 7.0;
pub const DEFAULT_SPEED: f32 = 1.0;
