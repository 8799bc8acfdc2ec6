// Authentication module
// Token handling for the JWT-protected routes

pub mod jwt;
