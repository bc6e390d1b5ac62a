mod client_builder_test;
mod index_test;
mod model_mapping_test;
