pub mod attrs;
pub mod element;
pub mod error;
pub mod pretty;
pub mod symbol;

pub use attrs::Attrs;
pub use element::{Element, Expr};
pub use error::{CoreError, Result};
pub use pretty::{canonical_cmp, format_element};
pub use symbol::{gensym, heads, reset_interner, Symbol};
