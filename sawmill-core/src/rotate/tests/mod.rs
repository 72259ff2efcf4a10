mod rotater_tests;
