mod common;
mod preconditions;
