//! Tests for the verification repository mock
