//! Modelos neutrales compartidos por definiciones y runtime: contacto,
//! entorno, mensajes de entrada y referencias a assets.

pub mod contact;
pub mod environment;
pub mod input;
pub mod references;

pub use contact::Contact;
pub use environment::Environment;
pub use input::{Dial, DialStatus, Input, MsgIn, MsgOut};
pub use references::{AssetReference, FieldReference, FlowReference, GroupReference};
