pub mod drag;
pub mod fog;
pub mod interaction;
pub mod session;
pub mod tokens;
pub mod transform;
pub mod viewport;
pub mod visibility;

pub use drag::{DragPayload, MOVE_TOKEN_KEY, NEW_TOKEN_KEY, NewTokenPayload};
pub use interaction::PointerButton;
pub use session::{MapSession, SessionAction};
