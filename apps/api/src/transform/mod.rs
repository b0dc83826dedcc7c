//! Form variant of the shell: one-shot rule application and question answering.

pub mod handlers;
