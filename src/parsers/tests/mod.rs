mod extractor_tests;
mod text_tests;
