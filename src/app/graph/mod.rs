mod build;
mod interaction;
mod neighborhood;
mod view;
