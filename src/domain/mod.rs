// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: a numeric sensor table and the fixed-length
// windows cut out of it.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The numeric table parsed from a sensor file
pub mod series;

// One window of rows reduced to (features, label)
pub mod window;

// Core abstractions (traits) that other layers implement
pub mod traits;
