mod condition_test;
mod struct_filter_test;
