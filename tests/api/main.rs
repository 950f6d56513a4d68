mod helpers;
mod home;
mod waitlist_api;
