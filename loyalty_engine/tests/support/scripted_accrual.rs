use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Instant,
};

use async_trait::async_trait;
use loyalty_engine::{
    accrual::{AccrualClientError, AccrualResult},
    db_types::OrderNumber,
    AccrualService,
};

#[derive(Debug, Clone)]
pub enum Step {
    Reply(AccrualResult),
    Panic,
}

/// An accrual service that plays back a script of answers per order number. The last answer in a script is repeated
/// forever. Orders without a script are reported as not registered.
#[derive(Clone, Default)]
pub struct ScriptedAccrual {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Step>>>>,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl ScriptedAccrual {
    pub fn script(&self, number: &str, steps: Vec<Step>) -> &Self {
        self.scripts.lock().unwrap().insert(number.to_string(), steps.into());
        self
    }

    pub fn calls_for(&self, number: &str) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().filter(|(n, _)| n == number).map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl AccrualService for ScriptedAccrual {
    async fn query(&self, number: &OrderNumber) -> Result<AccrualResult, AccrualClientError> {
        self.calls.lock().unwrap().push((number.as_str().to_string(), Instant::now()));
        // Release the lock before a scripted panic, or it would be poisoned
        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(number.as_str()) {
                Some(steps) if steps.len() > 1 => steps.pop_front(),
                Some(steps) => steps.front().cloned(),
                None => None,
            }
        };
        match step {
            Some(Step::Reply(result)) => Ok(result),
            Some(Step::Panic) => panic!("scripted accrual panic for order {number}"),
            None => Ok(AccrualResult::NotRegistered),
        }
    }
}
