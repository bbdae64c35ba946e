//! Model → entity mappers

mod event;
mod telegram;
