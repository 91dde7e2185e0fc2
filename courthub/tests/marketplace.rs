#[path = "marketplace/catalogue_tests.rs"]
mod catalogue_tests;
#[path = "marketplace/comment_count_tests.rs"]
mod comment_count_tests;
#[path = "marketplace/ownership_tests.rs"]
mod ownership_tests;
#[path = "marketplace/rating_tests.rs"]
mod rating_tests;
#[path = "marketplace/reconcile_tests.rs"]
mod reconcile_tests;
#[path = "marketplace/support.rs"]
mod support;
