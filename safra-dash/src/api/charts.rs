//! Chart and lookup endpoints
//!
//! Thin wrappers: validate the query, run the formatter against the shared
//! store, wrap the result in the response envelope.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use safra_common::api::ApiResponse;

use super::params::{ChartQuery, DEFAULT_MUNICIPALITY};
use super::ApiError;
use crate::charts::{self, MunicipalityInfo, MunicipalitySummary};
use crate::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/comparacao_nacional
pub async fn comparacao_nacional(State(state): State<AppState>) -> ApiResult<charts::NationalComparison> {
    let chart = charts::national_comparison(&state.store)
        .map_err(|e| ApiError::from_chart(e, "Erro ao carregar dados do gráfico"))?;

    Ok(Json(ApiResponse::ok(chart).with_message("Dados carregados com sucesso")))
}

/// GET /api/comparacao_estadual
pub async fn comparacao_estadual(State(state): State<AppState>) -> ApiResult<charts::StateComparison> {
    let chart = charts::state_comparison(&state.store)
        .map_err(|e| ApiError::from_chart(e, "Não foi possível carregar dados estaduais"))?;

    let message = format!("Dados de {} estados carregados", chart.metadata.total_estados);
    Ok(Json(ApiResponse::ok(chart).with_message(message)))
}

/// GET /api/waterfall?fonte=CONAB&periodo=2019-2020
pub async fn waterfall(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<charts::WaterfallChart> {
    let source = query.waterfall_source()?;
    let period = query.period()?;

    let chart = charts::waterfall(&state.store, source, &period)
        .map_err(|e| ApiError::from_chart(e, "Dados não disponíveis para a fonte e período solicitados"))?;

    Ok(Json(ApiResponse::ok(chart).with_parameters(json!({
        "fonte": source.label(),
        "periodo": period,
    }))))
}

/// GET /api/kpis?ano=2021&fonte=todas
pub async fn kpis(State(state): State<AppState>, Query(query): Query<ChartQuery>) -> ApiResult<charts::KpiReport> {
    let ano = query.year()?;
    let selection = query.selection()?;

    let report = charts::kpis(&state.store, ano, selection)
        .map_err(|e| ApiError::from_chart(e, "Dados não disponíveis para os parâmetros solicitados"))?;

    Ok(Json(
        ApiResponse::ok(report)
            .with_parameters(json!({ "ano": ano, "fonte": selection.key() }))
            .with_message("KPIs carregados com sucesso"),
    ))
}

/// GET /api/evolucao_temporal?cod_municipio=5100201
pub async fn evolucao_temporal(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<charts::MunicipalityTimeSeries> {
    let code = query.municipality(DEFAULT_MUNICIPALITY);

    let chart = charts::municipality_timeseries(&state.store, code)
        .map_err(|e| ApiError::from_chart(e, "Município não encontrado na base de dados"))?;

    Ok(Json(
        ApiResponse::ok(chart)
            .with_parameters(json!({ "cod_municipio": code }))
            .with_message("Dados de evolução temporal carregados com sucesso"),
    ))
}

/// GET /api/municipio_destaque?cod_municipio=5100201&ano=2021
pub async fn municipio_destaque(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<charts::MunicipalitySpotlight> {
    let ano = query.year()?;
    let code = query.municipality(DEFAULT_MUNICIPALITY);

    let card = charts::municipality_spotlight(&state.store, code, ano)
        .map_err(|e| ApiError::from_chart(e, "Dados não disponíveis para o município e ano solicitados"))?;

    Ok(Json(
        ApiResponse::ok(card)
            .with_parameters(json!({ "cod_municipio": code, "ano": ano }))
            .with_message("Dados do município carregados com sucesso"),
    ))
}

/// GET /api/mapa_estados?ano=2021&fonte=todas
pub async fn mapa_estados(State(state): State<AppState>, Query(query): Query<ChartQuery>) -> ApiResult<charts::StateMap> {
    let ano = query.year()?;
    let selection = query.selection()?;

    let map = charts::state_map(&state.store, ano, selection)
        .map_err(|e| ApiError::from_chart(e, "Dados não disponíveis para o ano e fonte solicitados"))?;

    Ok(Json(
        ApiResponse::ok(map)
            .with_parameters(json!({ "ano": ano, "fonte": selection.key() }))
            .with_message("Dados do mapa carregados com sucesso"),
    ))
}

/// GET /api/geojson_brasil
///
/// The boundary document itself, without the envelope.
pub async fn geojson_brasil(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    charts::boundaries(&state.store)
        .map(Json)
        .map_err(|e| ApiError::from_chart(e, "Erro ao carregar dados geográficos do Brasil"))
}

#[derive(Debug, Serialize)]
pub struct MunicipalityList {
    pub uf: String,
    pub ano: i64,
    pub municipios: Vec<MunicipalitySummary>,
    pub total: usize,
}

/// GET /api/municipios_por_estado?uf=MT&ano=2021
pub async fn municipios_por_estado(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<MunicipalityList> {
    let ano = query.year()?;
    let uf = query.uf();

    let municipios = charts::municipalities_by_state(&state.store, &uf, ano);
    if municipios.is_empty() {
        return Err(ApiError::NotFound {
            error: format!("Nenhum município encontrado para o estado {}", uf),
            message: Some("Estado não encontrado ou sem dados".to_string()),
            data: None,
        });
    }

    let message = format!("{} municípios encontrados", municipios.len());
    Ok(Json(
        ApiResponse::ok(MunicipalityList {
            uf,
            ano,
            total: municipios.len(),
            municipios,
        })
        .with_message(message),
    ))
}

/// GET /api/municipio_info?cod_municipio=5100201
pub async fn municipio_info(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<MunicipalityInfo> {
    let code = query.municipality("");

    charts::municipality_info(&state.store, code)
        .map(|info| Json(ApiResponse::ok(info)))
        .ok_or_else(|| ApiError::not_found(format!("Município {} não encontrado", code)))
}
