pub mod data_setup;
