mod backlog_test;
mod helpers;
mod recommendation_test;
mod router_test;
mod token_test;
