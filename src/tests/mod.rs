mod gravatar_tests;
mod request_meta_tests;
