mod effects_tests;
