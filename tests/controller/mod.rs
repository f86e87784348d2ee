mod auth;
mod booking;
mod checkout;
mod invitation;
mod property;
mod router;
