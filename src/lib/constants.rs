/// Shared numeric constants for floating-point operations.

/// Epsilon for general floating-point comparisons.
/// Use for: flow multipliers, time fractions, coordinates.
/// Handles typical f32 precision (~7 significant digits).
pub const EPSILON: f32 = 1e-4;

/// Tolerance for agreement of adjacent speed-flow segments at their
/// boundaries. The free-flow coefficient is the rounded 16.7 (not 50/3),
/// which leaves a 0.01 km/h step at v/c = 0.3.
pub const SEGMENT_AGREEMENT: f32 = 0.02;
