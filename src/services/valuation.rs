// src/services/valuation.rs
//
// Motor de valorização e agregação de estoque. Tudo aqui é função pura
// sobre coleções já carregadas em memória: nenhum I/O, nenhuma mutação
// das entradas. Os relatórios recalculam do zero a cada requisição; o
// volume por tenant (centenas de linhas) não justifica cache incremental.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{
    catalog::Product,
    movements::{MovementType, StockMovement},
};

// ---
// 1. Classificador de status de estoque
// ---

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,
    Low,
    Critical,
    OutOfStock,
}

impl StockStatus {
    // "Estoque baixo" no painel soma os níveis Low e Critical.
    pub fn needs_restock(&self) -> bool {
        matches!(self, StockStatus::Low | StockStatus::Critical)
    }
}

/// Regra canônica, única para todos os consumidores (relatório, dashboard):
/// - `OutOfStock` quando o saldo é zero (ou negativo);
/// - `Critical` quando saldo <= metade do mínimo;
/// - `Low` quando saldo <= mínimo;
/// - `Normal` caso contrário.
///
/// Comparações não-estritas (`<=`) nos dois limiares. Produto sem mínimo
/// configurado (min_stock == 0) nunca é Low/Critical.
pub fn classify(current_stock: i32, min_stock: i32) -> StockStatus {
    if current_stock <= 0 {
        return StockStatus::OutOfStock;
    }
    if min_stock <= 0 {
        return StockStatus::Normal;
    }
    // 2*saldo <= mínimo equivale a saldo <= mínimo/2 sem sair da aritmética
    // inteira; em i64 para que o dobro nunca estoure.
    if 2 * i64::from(current_stock) <= i64::from(min_stock) {
        return StockStatus::Critical;
    }
    if current_stock <= min_stock {
        return StockStatus::Low;
    }
    StockStatus::Normal
}

// ---
// 2. Custo médio ponderado de entrada
// ---

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryCostStats {
    /// Média ponderada por quantidade dos preços de entrada; cai para o
    /// cost_price do produto (ou zero) quando não há entradas precificadas.
    pub average_entry_price: Decimal,
    /// Preço unitário da entrada mais recente (desempate por id).
    pub last_entry_price: Option<Decimal>,
    pub entries_count: u32,
}

struct EntryAccum {
    total_value: Decimal,
    total_qty: i64,
    // Chave de recência: (movement_date, id). O id desempata datas iguais
    // de forma determinística.
    last: Option<(DateTime<Utc>, Uuid, Decimal)>,
    count: u32,
}

impl EntryAccum {
    fn new() -> Self {
        Self {
            total_value: Decimal::ZERO,
            total_qty: 0,
            last: None,
            count: 0,
        }
    }
}

/// Calcula as estatísticas de custo de entrada de cada produto da coleção.
///
/// Só qualificam movimentações `in` com unit_price não-nulo. Movimentações
/// órfãs (produto fora da coleção fornecida) são ignoradas aqui — elas não
/// participam de nenhuma agregação por produto.
pub fn entry_cost_index(
    products: &[Product],
    movements: &[StockMovement],
) -> HashMap<Uuid, EntryCostStats> {
    let known: HashSet<Uuid> = products.iter().map(|p| p.id).collect();
    let mut accum: HashMap<Uuid, EntryAccum> = HashMap::new();

    for m in movements {
        if m.movement_type != MovementType::In || !known.contains(&m.product_id) {
            continue;
        }
        let Some(price) = m.unit_price else { continue };

        let entry = accum.entry(m.product_id).or_insert_with(EntryAccum::new);
        entry.total_value += Decimal::from(m.quantity) * price;
        entry.total_qty += i64::from(m.quantity);
        entry.count += 1;

        let newer = match entry.last {
            Some((date, id, _)) => (m.movement_date, m.id) > (date, id),
            None => true,
        };
        if newer {
            entry.last = Some((m.movement_date, m.id, price));
        }
    }

    products
        .iter()
        .map(|p| {
            let stats = match accum.get(&p.id) {
                Some(a) if a.total_qty > 0 => EntryCostStats {
                    average_entry_price: a.total_value / Decimal::from(a.total_qty),
                    last_entry_price: a.last.map(|(_, _, price)| price),
                    entries_count: a.count,
                },
                _ => EntryCostStats {
                    average_entry_price: p.cost_price.unwrap_or(Decimal::ZERO),
                    last_entry_price: None,
                    entries_count: 0,
                },
            };
            (p.id, stats)
        })
        .collect()
}

// ---
// 3. Resumo do portfólio
// ---

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_products: usize,
    pub total_value_at_cost: Decimal,
    pub total_value_at_sale: Decimal,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

/// Resumo em uma única passada sobre o catálogo. Campos numéricos nulos
/// contam como zero, nunca propagam.
pub fn summarize(
    products: &[Product],
    costs: &HashMap<Uuid, EntryCostStats>,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_products: products.len(),
        total_value_at_cost: Decimal::ZERO,
        total_value_at_sale: Decimal::ZERO,
        low_stock_count: 0,
        out_of_stock_count: 0,
    };

    for p in products {
        let stock = Decimal::from(p.current_stock.max(0));
        let unit_cost = costs
            .get(&p.id)
            .map(|s| s.average_entry_price)
            .unwrap_or_else(|| p.cost_price.unwrap_or(Decimal::ZERO));

        summary.total_value_at_cost += stock * unit_cost;
        summary.total_value_at_sale += stock * p.sale_price.unwrap_or(Decimal::ZERO);

        match classify(p.current_stock, p.min_stock) {
            StockStatus::OutOfStock => summary.out_of_stock_count += 1,
            s if s.needs_restock() => summary.low_stock_count += 1,
            _ => {}
        }
    }

    summary
}

// ---
// 4. Janela de atividade (hoje / mês corrente)
// ---

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub entries_today: u32,
    pub month_entry_value: Decimal,
    pub month_moved_quantity: i64,
}

/// Classifica as movimentações contra o dia e o mês-calendário de
/// `reference_now`. Datas são comparadas no calendário UTC — a mesma
/// convenção em que `movement_date` é gravado. Uma movimentação no último
/// dia do mês anterior fica fora, mesmo a poucas horas do "agora".
pub fn activity(movements: &[StockMovement], reference_now: DateTime<Utc>) -> ActivitySummary {
    let today = reference_now.date_naive();
    let (year, month) = (reference_now.year(), reference_now.month());

    let mut summary = ActivitySummary {
        entries_today: 0,
        month_entry_value: Decimal::ZERO,
        month_moved_quantity: 0,
    };

    for m in movements {
        let day = m.movement_date.date_naive();
        let is_entry = m.movement_type == MovementType::In;

        if is_entry && day == today {
            summary.entries_today += 1;
        }
        if day.year() == year && day.month() == month {
            summary.month_moved_quantity += i64::from(m.quantity);
            if is_entry {
                summary.month_entry_value +=
                    Decimal::from(m.quantity) * m.unit_price.unwrap_or(Decimal::ZERO);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn product(stock: i32, min: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            category_id: None,
            code: "P-001".into(),
            name: "Produto de teste".into(),
            description: None,
            unit_measure: "un".into(),
            cost_price: None,
            sale_price: None,
            current_stock: stock,
            min_stock: min,
            max_stock: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(product_id: Uuid, qty: i32, price: Decimal, date: DateTime<Utc>) -> StockMovement {
        StockMovement {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            product_id,
            supplier_id: None,
            customer_id: None,
            movement_type: MovementType::In,
            quantity: qty,
            unit_price: Some(price),
            total_value: Some(Decimal::from(qty) * price),
            movement_date: date,
            reason: None,
            notes: None,
            created_at: date,
        }
    }

    fn exit(product_id: Uuid, qty: i32, date: DateTime<Utc>) -> StockMovement {
        StockMovement {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            product_id,
            supplier_id: None,
            customer_id: None,
            movement_type: MovementType::Out,
            quantity: qty,
            unit_price: None,
            total_value: None,
            movement_date: date,
            reason: Some("Venda".into()),
            notes: None,
            created_at: date,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn saldo_zero_e_sempre_sem_estoque() {
        for min in [0, 1, 10, 1000] {
            assert_eq!(classify(0, min), StockStatus::OutOfStock);
        }
        assert_eq!(classify(-3, 10), StockStatus::OutOfStock);
    }

    #[test]
    fn minimo_zero_nunca_gera_alerta() {
        assert_eq!(classify(5, 0), StockStatus::Normal);
        assert_eq!(classify(1, 0), StockStatus::Normal);
    }

    #[test]
    fn limiares_de_critico_e_baixo() {
        assert_eq!(classify(5, 10), StockStatus::Critical); // 5 <= 10/2
        assert_eq!(classify(8, 10), StockStatus::Low); // 8 <= 10, 8 > 5
        assert_eq!(classify(10, 10), StockStatus::Low); // limite não-estrito
        assert_eq!(classify(11, 10), StockStatus::Normal);
    }

    #[test]
    fn saldos_enormes_nao_estouram_o_classificador() {
        // O dobro do saldo não cabe em i32; a comparação tem que ser total.
        assert_eq!(classify(i32::MAX, i32::MAX), StockStatus::Low);
        assert_eq!(classify(i32::MAX, 10), StockStatus::Normal);
        assert_eq!(classify(i32::MAX / 2, i32::MAX), StockStatus::Critical);
    }

    #[test]
    fn media_e_ponderada_pela_quantidade() {
        let p = product(20, 0);
        let movements = vec![
            entry(p.id, 10, dec!(2.00), at(2026, 1, 5)),
            entry(p.id, 10, dec!(4.00), at(2026, 1, 10)),
        ];
        let index = entry_cost_index(std::slice::from_ref(&p), &movements);
        assert_eq!(index[&p.id].average_entry_price, dec!(3.00));

        // Quantidades diferentes: não é a média simples dos preços.
        let movements = vec![
            entry(p.id, 1, dec!(10.00), at(2026, 1, 5)),
            entry(p.id, 9, dec!(2.00), at(2026, 1, 10)),
        ];
        let index = entry_cost_index(std::slice::from_ref(&p), &movements);
        assert_eq!(index[&p.id].average_entry_price, dec!(2.80));
        assert_eq!(index[&p.id].entries_count, 2);
    }

    #[test]
    fn sem_entradas_cai_para_o_custo_cadastrado() {
        let mut p = product(5, 0);
        p.cost_price = Some(dec!(7.50));
        let index = entry_cost_index(std::slice::from_ref(&p), &[]);
        assert_eq!(index[&p.id].average_entry_price, dec!(7.50));
        assert_eq!(index[&p.id].last_entry_price, None);
        assert_eq!(index[&p.id].entries_count, 0);

        // E sem custo cadastrado, zero.
        p.cost_price = None;
        let index = entry_cost_index(std::slice::from_ref(&p), &[]);
        assert_eq!(index[&p.id].average_entry_price, Decimal::ZERO);
    }

    #[test]
    fn saida_e_entrada_sem_preco_nao_qualificam() {
        let p = product(5, 0);
        let mut unpriced = entry(p.id, 10, dec!(1.00), at(2026, 1, 5));
        unpriced.unit_price = None;
        let movements = vec![
            unpriced,
            exit(p.id, 3, at(2026, 1, 6)),
            entry(p.id, 4, dec!(5.00), at(2026, 1, 7)),
        ];
        let index = entry_cost_index(std::slice::from_ref(&p), &movements);
        assert_eq!(index[&p.id].average_entry_price, dec!(5.00));
        assert_eq!(index[&p.id].entries_count, 1);
    }

    #[test]
    fn ultima_entrada_desempata_por_id() {
        let p = product(5, 0);
        let date = at(2026, 2, 1);
        let mut a = entry(p.id, 1, dec!(1.00), date);
        let mut b = entry(p.id, 1, dec!(2.00), date);
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);

        // Mesma data nas duas ordens de chegada: vence sempre o maior id.
        let index = entry_cost_index(std::slice::from_ref(&p), &[a.clone(), b.clone()]);
        assert_eq!(index[&p.id].last_entry_price, Some(dec!(2.00)));
        let index = entry_cost_index(std::slice::from_ref(&p), &[b, a]);
        assert_eq!(index[&p.id].last_entry_price, Some(dec!(2.00)));
    }

    #[test]
    fn movimentacao_orfa_fica_fora_do_indice_por_produto() {
        let p = product(5, 0);
        let orphan = entry(Uuid::new_v4(), 100, dec!(99.00), at(2026, 1, 5));
        let movements = vec![orphan, entry(p.id, 2, dec!(3.00), at(2026, 1, 6))];

        let index = entry_cost_index(std::slice::from_ref(&p), &movements);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&p.id].average_entry_price, dec!(3.00));

        // Mas a contagem global de atividade ainda enxerga a órfã.
        let summary = activity(&movements, at(2026, 1, 15));
        assert_eq!(summary.month_moved_quantity, 102);
    }

    #[test]
    fn resumo_e_invariante_a_reordenacao() {
        let mut a = product(10, 0);
        a.cost_price = Some(dec!(2.00));
        a.sale_price = Some(dec!(5.00));
        let mut b = product(4, 0);
        b.cost_price = Some(dec!(1.50));
        b.sale_price = Some(dec!(3.00));

        let costs = entry_cost_index(&[a.clone(), b.clone()], &[]);
        let forward = summarize(&[a.clone(), b.clone()], &costs);
        let backward = summarize(&[b, a], &costs);

        assert_eq!(forward, backward);
        assert_eq!(forward.total_value_at_cost, dec!(26.00)); // 10*2.00 + 4*1.50
        assert_eq!(forward.total_value_at_sale, dec!(62.00)); // 10*5.00 + 4*3.00
    }

    #[test]
    fn cenario_completo_de_contagens() {
        let products = vec![product(0, 0), product(5, 10), product(20, 10)];
        let costs = entry_cost_index(&products, &[]);
        let summary = summarize(&products, &costs);

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.out_of_stock_count, 1);
        // O produto 5/10 é Critical, que também conta como estoque baixo.
        assert_eq!(summary.low_stock_count, 1);
    }

    #[test]
    fn janela_mensal_respeita_a_fronteira_do_calendario() {
        let p = Uuid::new_v4();
        let now = at(2026, 3, 1);
        let movements = vec![
            // Último dia do mês anterior: fora, mesmo a menos de 24h.
            entry(p, 50, dec!(1.00), Utc.with_ymd_and_hms(2026, 2, 28, 23, 0, 0).unwrap()),
            entry(p, 10, dec!(2.00), at(2026, 3, 1)),
            exit(p, 4, at(2026, 3, 1)),
        ];

        let summary = activity(&movements, now);
        assert_eq!(summary.entries_today, 1);
        assert_eq!(summary.month_entry_value, dec!(20.00));
        assert_eq!(summary.month_moved_quantity, 14);
    }

    #[test]
    fn entradas_de_hoje_ignoram_saidas() {
        let p = Uuid::new_v4();
        let now = at(2026, 3, 10);
        let movements = vec![
            entry(p, 1, dec!(1.00), at(2026, 3, 10)),
            entry(p, 1, dec!(1.00), at(2026, 3, 9)),
            exit(p, 1, at(2026, 3, 10)),
        ];
        assert_eq!(activity(&movements, now).entries_today, 1);
    }
}
