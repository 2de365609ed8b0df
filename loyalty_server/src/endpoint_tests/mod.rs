mod accounts;
mod flow;
mod helpers;
mod ledger;
mod mocks;
mod orders;
