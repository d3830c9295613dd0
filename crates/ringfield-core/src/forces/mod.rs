/// Per-particle forces acting on the ring field.
pub mod pointer;
pub mod spring;
