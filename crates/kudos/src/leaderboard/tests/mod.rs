mod badges;
mod common;
mod windowing;
