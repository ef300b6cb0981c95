//! G.711 Test Modules

mod codec_tests;
