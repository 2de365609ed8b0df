use async_trait::async_trait;
use loyalty_engine::{
    db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatusType, Withdrawal},
    traits::{
        AuthApiError,
        AuthManagement,
        InsertOrderResult,
        LedgerApiError,
        LedgerManagement,
        OrderFlowError,
        OrderManagement,
        WithdrawalResult,
    },
};
use lps_common::{Points, Secret};
use mockall::mock;

mock! {
    pub Backend {}
    #[async_trait]
    impl OrderManagement for Backend {
        async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderFlowError>;
        async fn update_order_status(
            &self,
            number: &OrderNumber,
            status: OrderStatusType,
            accrual: Option<Points>,
            credit_owner: bool,
        ) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_order(&self, number: &OrderNumber) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_orders_for_owner(&self, owner: &str) -> Result<Vec<Order>, OrderFlowError>;
        async fn fetch_unsettled_orders(&self) -> Result<Vec<Order>, OrderFlowError>;
    }
    #[async_trait]
    impl LedgerManagement for Backend {
        async fn fetch_balance(&self, owner: &str) -> Result<Balance, LedgerApiError>;
        async fn debit(&self, owner: &str, sum: Points) -> Result<Balance, LedgerApiError>;
        async fn credit(&self, owner: &str, sum: Points) -> Result<Balance, LedgerApiError>;
        async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<bool, LedgerApiError>;
        async fn process_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<WithdrawalResult, LedgerApiError>;
        async fn fetch_withdrawals(&self, owner: &str) -> Result<Vec<Withdrawal>, LedgerApiError>;
    }
    #[async_trait]
    impl AuthManagement for Backend {
        async fn register_user(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError>;
        async fn login_user(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError>;
        async fn fetch_login_for_session(&self, token: &str) -> Result<Option<String>, AuthApiError>;
    }
}

impl MockBackend {
    /// A backend that knows exactly one session, `alice-session`, which belongs to `alice`.
    pub fn with_alice() -> Self {
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_login_for_session()
            .returning(|token| Ok((token == "alice-session").then(|| "alice".to_string())));
        backend
    }
}
