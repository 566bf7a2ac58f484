use proptest::prelude::*;
use vanilla_lib::{
    default_configs, greeks, price, ImpliedVolatilitySolver, MarketData, OptionContract,
    OptionType,
};

fn option_type_strategy() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

// Continuously compounded markets across a practical range of rates and vols
fn market_strategy() -> impl Strategy<Value = MarketData> {
    (50.0..150.0f64, -0.02..0.10f64, 0.0..0.08f64, 0.0..1.5f64)
        .prop_map(|(spot, rate, div, vol)| MarketData::continuous(spot, rate, div, vol))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_put_call_parity_holds(
        market in market_strategy(),
        strike in 50.0..150.0f64,
        maturity in 0.01..5.0f64,
    ) {
        let call = price(&OptionContract::call(strike, maturity), &market).unwrap();
        let put = price(&OptionContract::put(strike, maturity), &market).unwrap();
        let parity = market.spot * market.dividend_discount_factor(maturity)
            - strike * market.discount_factor(maturity);

        prop_assert!(
            (call - put - parity).abs() < 1e-9,
            "C - P = {} but forward parity gives {}", call - put, parity
        );
    }

    #[test]
    fn test_price_within_no_arbitrage_bounds(
        option_type in option_type_strategy(),
        market in market_strategy(),
        strike in 50.0..150.0f64,
        maturity in 0.01..5.0f64,
    ) {
        let contract = OptionContract::new(option_type, strike, maturity);
        let npv = price(&contract, &market).unwrap();

        prop_assert!(npv >= contract.discounted_intrinsic(&market) - 1e-9);
        prop_assert!(npv <= contract.price_upper_bound(&market) + 1e-9);
    }

    #[test]
    fn test_gamma_and_vega_non_negative(
        option_type in option_type_strategy(),
        market in market_strategy(),
        strike in 1.0..500.0f64,
        maturity in 0.001..10.0f64,
    ) {
        let result = greeks(&OptionContract::new(option_type, strike, maturity), &market).unwrap();
        prop_assert!(result.gamma >= 0.0);
        prop_assert!(result.vega >= 0.0);
    }

    #[test]
    fn test_delta_monotone_in_spot(
        option_type in option_type_strategy(),
        market in market_strategy(),
        strike in 50.0..150.0f64,
        maturity in 0.01..5.0f64,
        bump in 0.01..20.0f64,
    ) {
        let contract = OptionContract::new(option_type, strike, maturity);
        let low = greeks(&contract, &market).unwrap().delta;
        let high = greeks(&contract, &market.with_spot(market.spot + bump)).unwrap().delta;

        // Both call and put deltas increase with spot
        prop_assert!(high >= low - 1e-12, "delta fell from {} to {}", low, high);
    }

    #[test]
    fn test_implied_vol_round_trip(
        option_type in option_type_strategy(),
        strike in 80.0..125.0f64,
        maturity in 0.1..2.0f64,
        rate in 0.0..0.08f64,
        div in 0.0..0.05f64,
        vol in 0.1..0.8f64,
    ) {
        let contract = OptionContract::new(option_type, strike, maturity);
        let market = MarketData::continuous(100.0, rate, div, vol);
        let result = greeks(&contract, &market).unwrap();
        prop_assume!(result.vega > 1e-2);
        prop_assume!(result.npv - contract.discounted_intrinsic(&market) > 1e-8);

        let solver = ImpliedVolatilitySolver::new(default_configs::precise());
        let solved = solver.solve(&contract, &market, result.npv).unwrap();
        prop_assert!((solved - vol).abs() < 1e-7, "priced at {}, solved {}", vol, solved);
    }
}
