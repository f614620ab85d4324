mod helpers;
mod otp;
mod signin;
mod summary;
