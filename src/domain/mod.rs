// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// The seven emotion classes
pub mod emotion;

// Facial landmark feature groups and their slice ranges
pub mod landmarks;

// A labelled feature matrix
pub mod sample;

// The typed train/validation/test partition
pub mod split;

// Pixel vs landmark network family
pub mod variant;

// Core abstractions (traits) that other layers implement
pub mod traits;
