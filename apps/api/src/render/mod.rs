// Render API: thin HTTP shell over the layout engine.
// Handlers validate input, then run layout + export inside spawn_blocking.

pub mod handlers;
