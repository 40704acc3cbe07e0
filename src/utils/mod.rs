pub mod index_type;
