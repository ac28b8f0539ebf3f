/*!
Proxy health tests module.

Tests for registration, per-provider checks, response parsing and URL construction.
*/

pub mod auth_tests;
pub mod checker_tests;
