mod session_options_test;
mod session_test;
mod soft_delete_test;
