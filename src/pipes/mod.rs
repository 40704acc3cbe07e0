pub mod circ_array;
pub mod linked;
pub mod list;
