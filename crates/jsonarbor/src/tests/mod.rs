mod common;

mod paths;
mod recycle;
