//! G.72x Test Modules

mod roundtrip_tests;
