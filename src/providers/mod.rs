pub mod dnscmd;
