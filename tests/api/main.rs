mod admin;
mod deck;
mod health;
mod helpers;
mod session;
