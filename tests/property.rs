mod common;

mod property {
    mod idempotence;
    mod required;
    mod schedule;
}
