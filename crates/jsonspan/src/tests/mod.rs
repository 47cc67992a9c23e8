//! Cross-component scenarios and properties: everything that exercises the
//! emitter and scanner against each other lives here; unit tests stay next
//! to their modules.

mod scenarios;
