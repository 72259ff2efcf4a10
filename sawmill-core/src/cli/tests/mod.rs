mod printer_tests;
