#![cfg(test)]
mod fixtures;

mod cables {
    mod integration;
}

mod links {
    mod integration;
}
