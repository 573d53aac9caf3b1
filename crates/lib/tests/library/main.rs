#![cfg(unix)]

mod shell_flow_tests;
