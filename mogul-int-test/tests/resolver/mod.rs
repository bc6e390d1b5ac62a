mod resolver_test;
